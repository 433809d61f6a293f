pub mod catalog;
pub mod locators;
pub mod pages;
