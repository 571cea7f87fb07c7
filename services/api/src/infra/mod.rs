pub mod cloudinary;
pub mod db;
pub mod mail;
pub mod razorpay;
