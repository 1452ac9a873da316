#[cfg(test)]
mod common;

#[cfg(test)]
mod auth_tests;

#[cfg(test)]
mod complaint_tests;

#[cfg(test)]
mod dashboard_tests;

#[cfg(test)]
mod feed_tests;
