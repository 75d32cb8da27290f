mod naming;
mod template;
mod tree;
