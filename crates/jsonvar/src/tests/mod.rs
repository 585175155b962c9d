mod emit;
mod parse_bad;
mod parse_good;
mod property_roundtrip;
