use flate2::{
    write::ZlibEncoder, Compression, Decompress, FlushDecompress, Status,
};

use log::debug;

use std::{error, fmt, io::Write};

/// The input wasn't a complete zlib stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorruptStream(pub String);

impl fmt::Display for CorruptStream {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "corrupt zlib stream: {}", self.0)
    }
}

impl error::Error for CorruptStream {}

/// Compress `data` into a zlib stream, the format spamd expects when the
/// `Compress` header is present
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut encoder =
        ZlibEncoder::new(Vec::with_capacity(data.len() / 2 + 16), Compression::default());

    // Writes into a Vec can't fail
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .expect("zlib stream backed by a Vec")
}

/// Inflate a zlib stream. Unlike `flate2::read::ZlibDecoder` a stream which
/// ends before its trailer is an error rather than a short read.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CorruptStream> {
    let mut inflater = Decompress::new(true);
    let mut buf = Vec::with_capacity(data.len() * 3 + 64);

    loop {
        if buf.len() == buf.capacity() {
            buf.reserve(buf.capacity());
        }

        let (in_before, out_before) = (inflater.total_in(), inflater.total_out());
        let input = &data[in_before as usize..];

        // Finish needs the whole output to fit in one call, so inflate in steps
        let status = inflater
            .decompress_vec(input, &mut buf, FlushDecompress::None)
            .map_err(|e| CorruptStream(e.to_string()))?;

        match status {
            Status::StreamEnd => {
                let trailing = data.len() as u64 - inflater.total_in();
                if trailing > 0 {
                    debug!("Ignoring {} bytes after the end of the zlib stream", trailing);
                }
                return Ok(buf);
            }
            Status::Ok | Status::BufError => {
                if inflater.total_in() == in_before
                    && inflater.total_out() == out_before
                    && buf.len() < buf.capacity()
                {
                    return Err(CorruptStream(
                        "stream ended before its trailer".to_owned(),
                    ));
                }
            }
        }
    }
}
