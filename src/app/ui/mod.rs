mod controls;
mod footer;
