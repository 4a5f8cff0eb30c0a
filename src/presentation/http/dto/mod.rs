pub mod document_dto;
pub mod rag_dto;
pub mod response_dto;

pub use response_dto::{
    ApiResponse, BannerResponseDto, EndpointDto, ErrorResponse, error_response, upstream_detail,
    upstream_status,
};
