mod common;
mod tracker;
