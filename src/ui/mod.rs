/// UI layer: render functions taking the session state explicitly.
pub mod gallery;
pub mod panels;
