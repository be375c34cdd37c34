// frbhost-core/src/infrastructure/codec/fits.rs

//! Minimal FITS binary-table codec.
//!
//! Writes an empty primary HDU followed by one `BINTABLE` extension, the layout
//! CIGALE and astropy expect for input catalogs. Reads the first `BINTABLE`
//! of a file: scalar columns of type L, B, I, J, K, E, D and character columns
//! (`nA`). Vector columns are skipped.

use std::path::Path;

use tracing::debug;

use crate::domain::photometry::{Column, ColumnData, PhotometryTable};
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

const BLOCK: usize = 2880;
const CARD: usize = 80;

#[derive(Debug, Clone, PartialEq)]
enum CardValue {
    Logical(bool),
    Integer(i64),
    Text(String),
}

fn fits_err(path: &Path, reason: impl Into<String>) -> InfrastructureError {
    InfrastructureError::Fits {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

// --- WRITER ---

fn card(key: &str, value: &CardValue) -> Result<String, String> {
    let body = match value {
        CardValue::Logical(b) => format!("{key:<8}= {:>20}", if *b { "T" } else { "F" }),
        CardValue::Integer(n) => format!("{key:<8}= {n:>20}"),
        CardValue::Text(s) => format!("{key:<8}= '{:<8}'", s.replace('\'', "''")),
    };
    if body.len() > CARD || key.len() > 8 {
        return Err(format!("header card too long for key '{key}'"));
    }
    Ok(format!("{body:<80}"))
}

fn push_header(out: &mut Vec<u8>, cards: &[(String, CardValue)]) -> Result<(), String> {
    for (key, value) in cards {
        out.extend_from_slice(card(key, value)?.as_bytes());
    }
    out.extend_from_slice(format!("{:<80}", "END").as_bytes());
    pad(out, b' ');
    Ok(())
}

fn pad(out: &mut Vec<u8>, fill: u8) {
    let rem = out.len() % BLOCK;
    if rem != 0 {
        out.resize(out.len() + BLOCK - rem, fill);
    }
}

/// Byte width and TFORM code of each column.
fn column_layout(column: &Column) -> (usize, String) {
    match &column.data {
        ColumnData::Float(_) => (8, "D".to_string()),
        ColumnData::Int(_) => (8, "K".to_string()),
        ColumnData::Text(values) => {
            let width = values
                .iter()
                .map(|v| v.as_deref().map(str::len).unwrap_or(0))
                .max()
                .unwrap_or(0)
                .max(1);
            (width, format!("{width}A"))
        }
    }
}

/// Encode `table` as a complete FITS file.
pub fn encode_table(table: &PhotometryTable) -> Result<Vec<u8>, String> {
    let layouts: Vec<(usize, String)> = table.columns().iter().map(column_layout).collect();
    let row_bytes: usize = layouts.iter().map(|(w, _)| w).sum();
    let rows = table.row_count();

    let mut out = Vec::with_capacity(2 * BLOCK + row_bytes * rows);

    let primary = vec![
        ("SIMPLE".to_string(), CardValue::Logical(true)),
        ("BITPIX".to_string(), CardValue::Integer(8)),
        ("NAXIS".to_string(), CardValue::Integer(0)),
        ("EXTEND".to_string(), CardValue::Logical(true)),
    ];
    push_header(&mut out, &primary)?;

    let mut ext = vec![
        ("XTENSION".to_string(), CardValue::Text("BINTABLE".into())),
        ("BITPIX".to_string(), CardValue::Integer(8)),
        ("NAXIS".to_string(), CardValue::Integer(2)),
        ("NAXIS1".to_string(), CardValue::Integer(row_bytes as i64)),
        ("NAXIS2".to_string(), CardValue::Integer(rows as i64)),
        ("PCOUNT".to_string(), CardValue::Integer(0)),
        ("GCOUNT".to_string(), CardValue::Integer(1)),
        (
            "TFIELDS".to_string(),
            CardValue::Integer(table.columns().len() as i64),
        ),
    ];
    for (i, (column, (_, tform))) in table.columns().iter().zip(&layouts).enumerate() {
        let n = i + 1;
        ext.push((format!("TTYPE{n}"), CardValue::Text(column.name.clone())));
        ext.push((format!("TFORM{n}"), CardValue::Text(tform.clone())));
        if matches!(column.data, ColumnData::Int(_)) {
            ext.push((format!("TNULL{n}"), CardValue::Integer(i64::MIN)));
        }
    }
    push_header(&mut out, &ext)?;

    for row in 0..rows {
        for (column, (width, _)) in table.columns().iter().zip(&layouts) {
            match &column.data {
                ColumnData::Float(v) => {
                    let x = v.get(row).copied().flatten().unwrap_or(f64::NAN);
                    out.extend_from_slice(&x.to_be_bytes());
                }
                ColumnData::Int(v) => {
                    let x = v.get(row).copied().flatten().unwrap_or(i64::MIN);
                    out.extend_from_slice(&x.to_be_bytes());
                }
                ColumnData::Text(v) => {
                    let s = v.get(row).cloned().flatten().unwrap_or_default();
                    let mut bytes = s.into_bytes();
                    bytes.resize(*width, b' ');
                    out.extend_from_slice(&bytes);
                }
            }
        }
    }
    pad(&mut out, 0);

    Ok(out)
}

pub fn write_fits_table(
    path: &Path,
    table: &PhotometryTable,
    overwrite: bool,
) -> Result<(), InfrastructureError> {
    let bytes = encode_table(table).map_err(|reason| fits_err(path, reason))?;
    atomic_write(path, bytes, overwrite)
}

// --- READER ---

#[derive(Debug, Default)]
struct Header {
    cards: Vec<(String, String)>,
}

impl Header {
    fn raw(&self, key: &str) -> Option<&str> {
        self.cards
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn int(&self, key: &str) -> Option<i64> {
        self.raw(key).and_then(|v| v.parse().ok())
    }

    fn float(&self, key: &str) -> Option<f64> {
        self.raw(key)
            .and_then(|v| v.replace(['D', 'd'], "E").parse().ok())
    }

    fn text(&self, key: &str) -> Option<String> {
        self.raw(key).map(|v| v.trim_end().to_string())
    }
}

/// Value part of a card: quoted strings unescaped, others cut at the comment.
fn parse_value(field: &str) -> String {
    let trimmed = field.trim_start();
    if let Some(rest) = trimmed.strip_prefix('\'') {
        let mut out = String::new();
        let mut chars = rest.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\'' {
                if chars.peek() == Some(&'\'') {
                    out.push('\'');
                    chars.next();
                } else {
                    break;
                }
            } else {
                out.push(c);
            }
        }
        out
    } else {
        trimmed
            .split('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

/// Parse the header starting at `offset`; returns it with the offset of its data.
fn read_header(bytes: &[u8], offset: usize) -> Result<(Header, usize), String> {
    let mut header = Header::default();
    let mut pos = offset;
    loop {
        let raw = bytes
            .get(pos..pos + CARD)
            .ok_or_else(|| "truncated header (no END card)".to_string())?;
        pos += CARD;
        let text = String::from_utf8_lossy(raw).into_owned();
        let key = text.get(..8).unwrap_or(text.as_str()).trim().to_string();
        if key == "END" {
            break;
        }
        if text.get(8..10) == Some("= ") {
            header
                .cards
                .push((key, parse_value(text.get(10..).unwrap_or_default())));
        }
    }
    let used = pos - offset;
    let blocks = used.div_ceil(BLOCK);
    Ok((header, offset + blocks * BLOCK))
}

fn overflow() -> String {
    "header sizes overflow".to_string()
}

fn data_size(header: &Header) -> Result<usize, String> {
    let naxis = header.int("NAXIS").unwrap_or(0);
    if naxis <= 0 {
        return Ok(0);
    }
    let bitpix = header.int("BITPIX").unwrap_or(8).unsigned_abs() as usize / 8;
    let axes = (1..=naxis)
        .map(|n| header.int(&format!("NAXIS{n}")).unwrap_or(0).max(0) as usize)
        .try_fold(1usize, |acc, n| acc.checked_mul(n))
        .ok_or_else(overflow)?;
    let pcount = header.int("PCOUNT").unwrap_or(0).max(0) as usize;
    let gcount = header.int("GCOUNT").unwrap_or(1).max(1) as usize;
    let size = pcount
        .checked_add(axes)
        .and_then(|n| n.checked_mul(gcount))
        .and_then(|n| n.checked_mul(bitpix))
        .ok_or_else(overflow)?;
    size.div_ceil(BLOCK).checked_mul(BLOCK).ok_or_else(overflow)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldKind {
    Logical,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Text,
    Other(usize),
}

impl FieldKind {
    fn width(self) -> usize {
        match self {
            Self::Logical | Self::Byte | Self::Text => 1,
            Self::Short => 2,
            Self::Int | Self::Float => 4,
            Self::Long | Self::Double => 8,
            Self::Other(w) => w,
        }
    }
}

#[derive(Debug)]
struct Field {
    name: String,
    kind: FieldKind,
    repeat: usize,
    offset: usize,
    bytes: usize,
    null: Option<i64>,
    scale: f64,
    zero: f64,
}

fn parse_tform(tform: &str) -> Result<(usize, FieldKind), String> {
    let tform = tform.trim();
    let digits: String = tform.chars().take_while(|c| c.is_ascii_digit()).collect();
    let repeat = if digits.is_empty() {
        1
    } else {
        digits.parse().map_err(|_| format!("bad TFORM '{tform}'"))?
    };
    let code = tform[digits.len()..]
        .chars()
        .next()
        .ok_or_else(|| format!("bad TFORM '{tform}'"))?;
    let kind = match code {
        'L' => FieldKind::Logical,
        'B' => FieldKind::Byte,
        'I' => FieldKind::Short,
        'J' => FieldKind::Int,
        'K' => FieldKind::Long,
        'E' => FieldKind::Float,
        'D' => FieldKind::Double,
        'A' => FieldKind::Text,
        'X' => FieldKind::Other(0),
        'C' | 'P' => FieldKind::Other(8),
        'M' | 'Q' => FieldKind::Other(16),
        other => return Err(format!("unsupported TFORM code '{other}'")),
    };
    Ok((repeat, kind))
}

fn field_bytes(kind: FieldKind, repeat: usize) -> Option<usize> {
    match kind {
        // bits, rounded up to bytes
        FieldKind::Other(0) => Some(repeat.div_ceil(8)),
        _ => kind.width().checked_mul(repeat),
    }
}

fn decode_int(kind: FieldKind, b: &[u8]) -> Option<i64> {
    Some(match kind {
        FieldKind::Logical => match b.first()? {
            b'T' => 1,
            b'F' => 0,
            _ => return None,
        },
        FieldKind::Byte => i64::from(*b.first()?),
        FieldKind::Short => i64::from(i16::from_be_bytes(b.get(..2)?.try_into().ok()?)),
        FieldKind::Int => i64::from(i32::from_be_bytes(b.get(..4)?.try_into().ok()?)),
        FieldKind::Long => i64::from_be_bytes(b.get(..8)?.try_into().ok()?),
        _ => return None,
    })
}

fn decode_float(kind: FieldKind, b: &[u8]) -> Option<f64> {
    let x = match kind {
        FieldKind::Float => f64::from(f32::from_be_bytes(b.get(..4)?.try_into().ok()?)),
        FieldKind::Double => f64::from_be_bytes(b.get(..8)?.try_into().ok()?),
        _ => return None,
    };
    x.is_finite().then_some(x)
}

/// Decode the first binary table of a FITS file.
pub fn decode_table(bytes: &[u8]) -> Result<PhotometryTable, String> {
    let mut offset = 0;
    let header = loop {
        if offset >= bytes.len() {
            return Err("no BINTABLE extension found".to_string());
        }
        let (header, data_start) = read_header(bytes, offset)?;
        if header.text("XTENSION").as_deref() == Some("BINTABLE") {
            offset = data_start;
            break header;
        }
        offset = data_start
            .checked_add(data_size(&header)?)
            .ok_or_else(overflow)?;
    };

    let row_bytes = header.int("NAXIS1").unwrap_or(0).max(0) as usize;
    let rows = header.int("NAXIS2").unwrap_or(0).max(0) as usize;
    let tfields = header.int("TFIELDS").unwrap_or(0).max(0) as usize;

    let mut fields = Vec::with_capacity(tfields);
    let mut cursor = 0;
    for n in 1..=tfields {
        let tform = header
            .text(&format!("TFORM{n}"))
            .ok_or_else(|| format!("missing TFORM{n}"))?;
        let (repeat, kind) = parse_tform(&tform)?;
        let bytes = field_bytes(kind, repeat).ok_or_else(overflow)?;
        let name = header
            .text(&format!("TTYPE{n}"))
            .unwrap_or_else(|| format!("col{n}"));
        fields.push(Field {
            name,
            kind,
            repeat,
            offset: cursor,
            bytes,
            null: header.int(&format!("TNULL{n}")),
            scale: header.float(&format!("TSCAL{n}")).unwrap_or(1.0),
            zero: header.float(&format!("TZERO{n}")).unwrap_or(0.0),
        });
        cursor = cursor.checked_add(bytes).ok_or_else(overflow)?;
    }
    if cursor != row_bytes {
        return Err(format!("column widths ({cursor}) do not match NAXIS1 ({row_bytes})"));
    }

    let end = row_bytes
        .checked_mul(rows)
        .and_then(|n| n.checked_add(offset))
        .ok_or_else(overflow)?;
    let data = bytes
        .get(offset..end)
        .ok_or_else(|| "truncated table data".to_string())?;

    let mut table = PhotometryTable::new();
    for field in &fields {
        let cells = (0..rows).map(|r| {
            let start = r * row_bytes + field.offset;
            data.get(start..start + field.bytes)
                .unwrap_or_default()
        });

        let column = match field.kind {
            FieldKind::Text => ColumnData::Text(
                cells
                    .map(|b| {
                        let s = String::from_utf8_lossy(b);
                        let s = s.trim_end_matches(['\0', ' ']);
                        (!s.is_empty()).then(|| s.to_string())
                    })
                    .collect(),
            ),
            _ if field.repeat != 1 => {
                debug!(column = %field.name, repeat = field.repeat, "Skipping vector column");
                continue;
            }
            FieldKind::Float | FieldKind::Double => ColumnData::Float(
                cells
                    .map(|b| decode_float(field.kind, b).map(|x| x * field.scale + field.zero))
                    .collect(),
            ),
            FieldKind::Other(_) => {
                debug!(column = %field.name, "Skipping unsupported column type");
                continue;
            }
            _ => {
                let ints = cells.map(|b| decode_int(field.kind, b).filter(|v| Some(*v) != field.null));
                if field.scale == 1.0 && field.zero.fract() == 0.0 {
                    let zero = field.zero as i64;
                    ColumnData::Int(ints.map(|v| v.map(|x| x + zero)).collect())
                } else {
                    ColumnData::Float(
                        ints.map(|v| v.map(|x| x as f64 * field.scale + field.zero))
                            .collect(),
                    )
                }
            }
        };
        table
            .push_column(Column::new(field.name.clone(), column))
            .map_err(|e| e.to_string())?;
    }

    Ok(table)
}

pub fn read_fits_table(path: &Path) -> Result<PhotometryTable, InfrastructureError> {
    let bytes = std::fs::read(path)?;
    decode_table(&bytes).map_err(|reason| fits_err(path, reason))
}
