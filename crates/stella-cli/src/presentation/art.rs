//! Banner and faces.

pub const BANNER: &str = r"
╭────────────────────────────────────────────────────────╮
│                                                        │
│      ⋆｡°✩  Stella - Your Terminal Companion  ✩°｡⋆      │
│                                                        │
╰────────────────────────────────────────────────────────╯";

pub const FACES: [&str; 3] = [
    "    ╭─────╮\n    │ ^‿^ │\n    ╰─────╯",
    "    ╭─────╮\n    │ ･ω･ │\n    ╰─────╯",
    "    ╭─────╮\n    │ •◡• │\n    ╰─────╯",
];

/// Face for the `turn`-th reply; cycles through [`FACES`].
pub const fn face(turn: usize) -> &'static str {
    FACES[turn % FACES.len()]
}
