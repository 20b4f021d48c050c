pub mod form;
pub mod invoice;
pub mod trip;
