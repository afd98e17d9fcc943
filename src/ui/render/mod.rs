mod all;
mod footer;
mod list;
mod log;
mod pager;
mod query_bar;
mod tabs;

use self::log::log;
use super::*;
use footer::footer;
use list::list;
use pager::pager;
use query_bar::query_bar;
use tabs::tabs;

pub use all::all as render;
