mod catalog_test;
mod identity_test;
mod subscription_test;
