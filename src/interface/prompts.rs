use dialoguer::Input;

use crate::error::{MacroError, Result};
use crate::models::Solution;

/// Interpret the answer to "which item should go?".
///
/// Empty input accepts the plan (`None`). Otherwise the answer is a 1-based
/// item number, returned zero-based.
pub fn parse_removal_choice(input: &str, item_count: usize) -> Result<Option<usize>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    let number: usize = input
        .parse()
        .map_err(|_| MacroError::InvalidInput("Enter a number or press Enter".to_string()))?;

    if number == 0 || number > item_count {
        return Err(MacroError::InvalidInput(format!(
            "Pick a number from 1 to {}",
            item_count
        )));
    }
    Ok(Some(number - 1))
}

/// Ask which item to drop from `solution`. Re-asks on invalid input.
pub fn prompt_item_to_remove(solution: &Solution) -> Result<Option<usize>> {
    loop {
        let input: String = Input::new()
            .with_prompt("Number of an item to remove (Enter to accept the meal)")
            .allow_empty(true)
            .interact_text()?;

        match parse_removal_choice(&input, solution.items.len()) {
            Ok(choice) => return Ok(choice),
            Err(e) => println!("{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_answer_accepts() {
        assert_eq!(parse_removal_choice("", 3).unwrap(), None);
        assert_eq!(parse_removal_choice("   ", 3).unwrap(), None);
    }

    #[test]
    fn test_number_is_one_based() {
        assert_eq!(parse_removal_choice("1", 3).unwrap(), Some(0));
        assert_eq!(parse_removal_choice(" 3 ", 3).unwrap(), Some(2));
    }

    #[test]
    fn test_out_of_range_and_garbage_rejected() {
        assert!(matches!(parse_removal_choice("0", 3), Err(MacroError::InvalidInput(_))));
        assert!(matches!(parse_removal_choice("4", 3), Err(MacroError::InvalidInput(_))));
        assert!(matches!(parse_removal_choice("two", 3), Err(MacroError::InvalidInput(_))));
    }
}
