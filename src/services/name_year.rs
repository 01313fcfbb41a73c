use crate::error::{AppError, AppResult};

/// A free-text title query split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameYear {
    pub name: String,
    /// 0 when no year was given
    pub year: i32,
}

/// Splits `"Title (Year)"` into a title and a year
///
/// The year is read from the last parenthesised group. The title is everything
/// before the opening parenthesis minus its final character (the separating
/// space). Without a complete group the whole text is the title and the year is
/// 0; an empty group also means year 0. A group that is not an integer is an
/// `InvalidInput` error.
pub fn parse_name_year(text: &str) -> AppResult<NameYear> {
    let whole = || NameYear {
        name: text.to_string(),
        year: 0,
    };

    let Some(close) = text.rfind(')') else {
        return Ok(whole());
    };
    let Some(open) = text[..close].rfind('(') else {
        return Ok(whole());
    };

    let year_text = &text[open + 1..close];
    let before = &text[..open];
    let name = match before.char_indices().next_back() {
        Some((last, _)) => &before[..last],
        None => before,
    };

    let year = if year_text.is_empty() {
        0
    } else {
        year_text.trim().parse::<i32>().map_err(|_| {
            AppError::InvalidInput(format!("Invalid year '{}' in '{}'", year_text, text))
        })?
    };

    Ok(NameYear {
        name: name.to_string(),
        year,
    })
}
