mod comparer;
mod apply;
