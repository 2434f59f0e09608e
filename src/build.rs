mod builder;
mod html;
mod inline;
mod markup;
mod paths;
mod sidebar;

pub use builder::Builder;
