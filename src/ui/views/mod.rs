mod collection_list;

pub use collection_list::CollectionView;
