pub mod display_link;
pub mod event_dispatcher;
pub mod pressure_service;
pub mod temperature_service;
pub mod widget_writer;
