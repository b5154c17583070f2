mod input;
pub mod palette;
pub mod ripple;
pub mod window;

pub use input::{InputState, key_of_scancode};
pub use palette::{Palette, Rgb24};
pub use ripple::{RippleConfig, RippleShape, Ripples};
pub use window::{Window, WindowBuilder};
