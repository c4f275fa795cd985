mod concurrency;
mod properties;
