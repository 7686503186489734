// Business domains
pub mod landing_pages;
