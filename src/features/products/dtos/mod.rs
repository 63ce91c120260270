mod product_dto;

pub use product_dto::{
    FlexibleNumber, IncotermQuoteFormDto, IncotermQuoteResponseDto, ProductFormDto,
    ProductResponseDto, ValidatedProductForm,
};
