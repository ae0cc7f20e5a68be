mod facet;

pub(crate) use self::facet::BookProxy;
