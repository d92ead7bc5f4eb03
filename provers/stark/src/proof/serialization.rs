//! The proof wire format.
//!
//! Big-endian throughout. Array-length bytes follow the "0 means 256"
//! convention; Merkle node columns are prefixed with a plain length byte
//! capped at 127; each batch proof ends with a one-byte tree depth.
//!
//! ```text
//! trace_root            32 bytes
//! composition_root      32 bytes
//! trace opening         count byte, count * R elements, count node
//!                       columns (len byte + len * 32 bytes), depth byte
//! composition opening   same framing with single-element leaves
//! FRI                   layer count byte, then per layer a 32-byte root
//!                       and a batch opening with single-element leaves
//! remainder             length byte, then raw elements
//! ```

use lodestark_crypto::merkle_tree::batch::BatchProof;
use lodestark_math::field::element::FieldElement;
use lodestark_math::field::traits::IsPrimeField;
use lodestark_math::traits::ByteConversion;

use super::stark::{BatchOpening, FriLayerProof, StarkProof};
use crate::config::Commitment;
use crate::errors::SerializationError;
use crate::transcript::element_byte_size;

const MAX_LEAF_ARRAY_LEN: usize = 256;
const MAX_NODE_COLUMN_LEN: usize = 127;
const MAX_REMAINDER_LEN: usize = 256;

pub fn serialize_proof<F>(proof: &StarkProof<F>) -> Result<Vec<u8>, SerializationError>
where
    F: IsPrimeField,
    FieldElement<F>: ByteConversion,
{
    let mut buffer = Vec::with_capacity(proof_size(proof));
    buffer.extend_from_slice(&proof.trace_root);
    buffer.extend_from_slice(&proof.composition_root);
    write_batch_opening(&mut buffer, &proof.trace_opening)?;
    write_batch_opening(&mut buffer, &proof.composition_opening)?;

    debug_assert!(proof.fri_layers.len() < 256);
    buffer.push(proof.fri_layers.len() as u8);
    for layer in &proof.fri_layers {
        buffer.extend_from_slice(&layer.root);
        write_batch_opening(&mut buffer, &layer.opening)?;
    }

    let remainder_len = proof.remainder.len();
    if remainder_len == 0 || remainder_len > MAX_REMAINDER_LEN {
        return Err(SerializationError::RemainderTooLong(remainder_len));
    }
    buffer.push((remainder_len % 256) as u8);
    for element in &proof.remainder {
        buffer.extend_from_slice(&element.to_bytes_be());
    }

    Ok(buffer)
}

pub fn deserialize_proof<F>(
    bytes: &[u8],
    register_count: usize,
) -> Result<StarkProof<F>, SerializationError>
where
    F: IsPrimeField,
    FieldElement<F>: ByteConversion,
{
    let mut cursor = Cursor::new(bytes);
    let trace_root = cursor.take_commitment()?;
    let composition_root = cursor.take_commitment()?;
    let trace_opening = read_batch_opening(&mut cursor, register_count)?;
    let composition_opening = read_batch_opening(&mut cursor, 1)?;

    let layer_count = cursor.take_u8()? as usize;
    let mut fri_layers = Vec::with_capacity(layer_count);
    for _ in 0..layer_count {
        let root = cursor.take_commitment()?;
        let opening = read_batch_opening(&mut cursor, 1)?;
        fri_layers.push(FriLayerProof { root, opening });
    }

    let remainder_len = decode_length_byte(cursor.take_u8()?);
    let mut remainder = Vec::with_capacity(remainder_len);
    for _ in 0..remainder_len {
        remainder.push(cursor.take_element()?);
    }

    let unread = cursor.remaining();
    if unread > 0 {
        return Err(SerializationError::TrailingBytes(unread));
    }

    Ok(StarkProof {
        trace_root,
        composition_root,
        trace_opening,
        composition_opening,
        fri_layers,
        remainder,
    })
}

/// Exact byte length [`serialize_proof`] produces, without serializing.
pub fn proof_size<F>(proof: &StarkProof<F>) -> usize
where
    F: IsPrimeField,
{
    let element_size = element_byte_size::<F>();
    let batch_size = |opening: &BatchOpening<F>| -> usize {
        let value_bytes: usize = opening
            .values
            .iter()
            .map(|row| row.len() * element_size)
            .sum();
        let node_bytes: usize = opening
            .proof
            .nodes
            .iter()
            .map(|column| 1 + column.len() * 32)
            .sum();
        1 + value_bytes + node_bytes + 1
    };

    let mut size = 64;
    size += batch_size(&proof.trace_opening);
    size += batch_size(&proof.composition_opening);
    size += 1;
    for layer in &proof.fri_layers {
        size += 32 + batch_size(&layer.opening);
    }
    size += 1 + proof.remainder.len() * element_size;
    size
}

fn decode_length_byte(byte: u8) -> usize {
    if byte == 0 {
        256
    } else {
        byte as usize
    }
}

fn write_batch_opening<F>(
    buffer: &mut Vec<u8>,
    opening: &BatchOpening<F>,
) -> Result<(), SerializationError>
where
    F: IsPrimeField,
    FieldElement<F>: ByteConversion,
{
    let count = opening.values.len();
    if count == 0 || count > MAX_LEAF_ARRAY_LEN {
        return Err(SerializationError::LeafArrayTooLong(count));
    }
    debug_assert_eq!(count, opening.proof.nodes.len());
    buffer.push((count % 256) as u8);

    for row in &opening.values {
        debug_assert_eq!(row.len(), opening.values[0].len());
        for element in row {
            buffer.extend_from_slice(&element.to_bytes_be());
        }
    }

    for column in &opening.proof.nodes {
        if column.len() > MAX_NODE_COLUMN_LEN {
            return Err(SerializationError::NodeColumnTooLong(column.len()));
        }
        buffer.push(column.len() as u8);
        for node in column {
            buffer.extend_from_slice(node);
        }
    }

    buffer.push(opening.proof.depth);
    Ok(())
}

fn read_batch_opening<F>(
    cursor: &mut Cursor<'_>,
    leaf_width: usize,
) -> Result<BatchOpening<F>, SerializationError>
where
    F: IsPrimeField,
    FieldElement<F>: ByteConversion,
{
    let count = decode_length_byte(cursor.take_u8()?);

    let mut values = Vec::with_capacity(count);
    for _ in 0..count {
        let mut row = Vec::with_capacity(leaf_width);
        for _ in 0..leaf_width {
            row.push(cursor.take_element()?);
        }
        values.push(row);
    }

    let mut nodes = Vec::with_capacity(count);
    for _ in 0..count {
        let column_len = cursor.take_u8()? as usize;
        if column_len > MAX_NODE_COLUMN_LEN {
            return Err(SerializationError::NodeColumnTooLong(column_len));
        }
        let mut column = Vec::with_capacity(column_len);
        for _ in 0..column_len {
            column.push(cursor.take_commitment()?);
        }
        nodes.push(column);
    }

    let depth = cursor.take_u8()?;
    Ok(BatchOpening {
        values,
        proof: BatchProof { nodes, depth },
    })
}

struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], SerializationError> {
        if self.remaining() < len {
            return Err(SerializationError::UnexpectedEndOfBuffer);
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn take_u8(&mut self) -> Result<u8, SerializationError> {
        Ok(self.take(1)?[0])
    }

    fn take_commitment(&mut self) -> Result<Commitment, SerializationError> {
        let slice = self.take(32)?;
        let mut commitment = [0_u8; 32];
        commitment.copy_from_slice(slice);
        Ok(commitment)
    }

    fn take_element<F>(&mut self) -> Result<FieldElement<F>, SerializationError>
    where
        F: IsPrimeField,
        FieldElement<F>: ByteConversion,
    {
        let slice = self.take(element_byte_size::<F>())?;
        FieldElement::from_bytes_be(slice).map_err(|_| SerializationError::InvalidFieldElement)
    }
}
