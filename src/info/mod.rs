// src/info/mod.rs
mod contributor;
mod info;

pub use contributor::{
    BuildInfoContributor, InfoContributor, MapInfoContributor, SimpleInfoContributor,
};
pub use info::{Info, InfoBuilder};
