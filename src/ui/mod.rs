pub mod map_view;
pub mod panels;
