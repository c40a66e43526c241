mod dialog;

pub use dialog::render;
