mod input;
mod rendering;
