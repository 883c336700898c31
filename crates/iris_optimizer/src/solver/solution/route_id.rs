use crate::define_index_newtype;

use super::route::WorkingRoute;

define_index_newtype!(RouteIdx, WorkingRoute);
