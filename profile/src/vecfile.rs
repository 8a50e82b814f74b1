//! Binary vector artifact format.
//!
//! ```text
//! [4B magic "VOXV"] [4B version=1] [4B dim] [dim x 4B float32]
//! ```
//!
//! All multi-byte values are little-endian. Trailing bytes are rejected so a
//! torn or concatenated write is detected on load.

use std::io::{BufReader, BufWriter, Read, Write};

use crate::error::{ProfileError, ProfileResult};

const VEC_MAGIC: [u8; 4] = [b'V', b'O', b'X', b'V'];
const VEC_VERSION: u32 = 1;

/// Upper bound on dimension accepted on load.
const MAX_DIM: usize = 1 << 16;

/// Serializes `vector` to `w`.
pub fn save(vector: &[f32], w: &mut dyn Write) -> ProfileResult<()> {
    let mut bw = BufWriter::new(w);
    bw.write_all(&VEC_MAGIC)?;
    bw.write_all(&VEC_VERSION.to_le_bytes())?;
    bw.write_all(&(vector.len() as u32).to_le_bytes())?;
    for &v in vector {
        bw.write_all(&v.to_le_bytes())?;
    }
    bw.flush()?;
    Ok(())
}

/// Deserializes a vector written by [`save`].
pub fn load(r: &mut dyn Read) -> ProfileResult<Vec<f32>> {
    let mut br = BufReader::new(r);
    let mut buf4 = [0u8; 4];

    br.read_exact(&mut buf4).map_err(truncated)?;
    if buf4 != VEC_MAGIC {
        return Err(ProfileError::InvalidFormat(format!("invalid magic {buf4:?}")));
    }

    br.read_exact(&mut buf4).map_err(truncated)?;
    let version = u32::from_le_bytes(buf4);
    if version != VEC_VERSION {
        return Err(ProfileError::InvalidFormat(format!(
            "unsupported version {version} (want {VEC_VERSION})"
        )));
    }

    br.read_exact(&mut buf4).map_err(truncated)?;
    let dim = u32::from_le_bytes(buf4) as usize;
    if dim == 0 || dim > MAX_DIM {
        return Err(ProfileError::InvalidFormat(format!("invalid dimension {dim}")));
    }

    let mut vector = Vec::with_capacity(dim);
    for _ in 0..dim {
        br.read_exact(&mut buf4).map_err(truncated)?;
        vector.push(f32::from_le_bytes(buf4));
    }

    let mut rest = [0u8; 1];
    if br.read(&mut rest)? != 0 {
        return Err(ProfileError::InvalidFormat("trailing bytes after vector".into()));
    }

    Ok(vector)
}

fn truncated(e: std::io::Error) -> ProfileError {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        ProfileError::InvalidFormat("truncated vector artifact".into())
    } else {
        ProfileError::Io(e)
    }
}
