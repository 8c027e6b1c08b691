pub mod swing;
