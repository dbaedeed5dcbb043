pub mod keybindings;
pub mod theme;
