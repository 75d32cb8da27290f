mod dom;
mod types;
