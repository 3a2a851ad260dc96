pub mod prompt;

pub use prompt::prompt_confirm;

/// `""` for exactly one, `"s"` otherwise.
pub fn plural_s(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
