//! Extension traits

mod depot;
mod locale;
mod result;

pub(crate) use depot::DepotExt as _;
pub(crate) use locale::LocaleExt as _;
pub(crate) use result::ResultExt as _;
