#![allow(dead_code)]

pub mod aiff;
pub mod soundpeaks_env;
pub mod wav;
