pub mod random_bytes_bootstrap_token;
