pub mod category_list;
