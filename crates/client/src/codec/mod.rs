//! Wire-level helpers: splitting raw messages, parsing header blocks and
//! status lines, and removing chunked transfer framing.

mod chunked_decoder;
pub use chunked_decoder::ChunkItem;
pub use chunked_decoder::ChunkedDecoder;
pub use chunked_decoder::decode_chunked;
pub use chunked_decoder::looks_chunked;

mod message_parser;
pub use message_parser::HttpMessageParser;
pub use message_parser::MESSAGE_SEPARATOR;

mod status_line;
pub use status_line::first_line;
pub use status_line::parse_status_code;
