//! Terminal presentation for the chat session.
//!
//! Format-only: nothing here decides what to say, only how it looks.

pub mod art;
pub mod output;

pub use art::{BANNER, FACES, face};
pub use output::{
    Thinking, divider_line, print_divider, print_error, print_goodbye, print_info, print_list,
    print_response, print_slowly, print_speed_tips, print_system_info, print_warning,
};
