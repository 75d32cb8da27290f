mod hashing;
mod servers;
