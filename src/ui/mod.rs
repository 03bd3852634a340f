pub mod canvas;
pub mod menu_bar;
pub mod shortcuts;
pub mod status_bar;
pub mod tab_bar;
