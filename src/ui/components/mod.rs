pub mod builder_area;
pub mod info_panel;
pub mod menu;
pub mod result_screen;
pub mod stats_header;
pub mod typing_area;
