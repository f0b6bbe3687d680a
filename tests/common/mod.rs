//! Shared fixtures: builds complete table files byte by byte so the tests
//! exercise the real on-disk layout.

#![allow(dead_code)]

use std::path::Path;

const HEADER_LENGTH: usize = 400;
const DESCRIPTOR_LENGTH: usize = 200;
const RECORD_PREFIX: usize = 5;
const DELETED: u8 = 0x05;

pub struct TableBuilder {
    columns: Vec<(String, u16, u16)>,
    records: Vec<(u8, Vec<Vec<u8>>)>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn column(mut self, name: &str, type_code: u16, length: u16) -> Self {
        self.columns.push((name.to_string(), type_code, length));
        self
    }

    pub fn record(&mut self, fields: Vec<Vec<u8>>) -> &mut Self {
        self.records.push((0, fields));
        self
    }

    pub fn deleted_record(&mut self, fields: Vec<Vec<u8>>) -> &mut Self {
        self.records.push((DELETED, fields));
        self
    }

    pub fn write(&self, dir: &Path, table: &str) {
        let record_length =
            RECORD_PREFIX + self.columns.iter().map(|c| c.2 as usize).sum::<usize>();
        let data_offset = HEADER_LENGTH + DESCRIPTOR_LENGTH * self.columns.len();

        let mut out = vec![0u8; data_offset];
        out[24..28].copy_from_slice(&(self.records.len() as u32).to_le_bytes());
        out[32..36].copy_from_slice(&(data_offset as u32).to_le_bytes());
        out[36..40].copy_from_slice(&(record_length as u32).to_le_bytes());

        for (i, (name, type_code, length)) in self.columns.iter().enumerate() {
            let base = HEADER_LENGTH + i * DESCRIPTOR_LENGTH;
            out[base..base + name.len()].copy_from_slice(name.as_bytes());
            out[base + 129..base + 131].copy_from_slice(&type_code.to_le_bytes());
            out[base + 135..base + 137].copy_from_slice(&length.to_le_bytes());
        }

        for (status, fields) in &self.records {
            assert_eq!(fields.len(), self.columns.len(), "one field per column");
            let mut image = vec![0u8; RECORD_PREFIX];
            image[0] = *status;
            for (field, (_, _, length)) in fields.iter().zip(&self.columns) {
                let mut field = field.clone();
                field.resize(*length as usize, 0);
                image.extend_from_slice(&field);
            }
            out.extend_from_slice(&image);
        }

        std::fs::write(dir.join(format!("{table}.adt")), out).unwrap();
    }
}

pub fn text(value: &str, length: u16) -> Vec<u8> {
    let mut bytes = value.as_bytes().to_vec();
    bytes.resize(length as usize, b' ');
    bytes
}

pub fn raw_text(bytes: &[u8], length: u16) -> Vec<u8> {
    let mut bytes = bytes.to_vec();
    bytes.resize(length as usize, b' ');
    bytes
}

pub fn integer(value: i32) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

pub fn double(value: f64) -> Vec<u8> {
    value.to_le_bytes().to_vec()
}

/// animals: 7 live rows plus one deleted, CHARACTER name column
pub fn write_animals(dir: &Path) {
    let mut builder = TableBuilder::new()
        .column("ID", 11, 4)
        .column("NAME", 4, 20);
    let names = [
        "Angel Fish",
        "Boa",
        "Cat",
        "Dog",
        "Eagle",
        "Ferret",
        "Gecko",
    ];
    for (i, name) in names.iter().enumerate() {
        builder.record(vec![integer(i as i32 + 1), text(name, 20)]);
    }
    builder.deleted_record(vec![integer(99), text("Ghost", 20)]);
    builder.write(dir, "animals");
}

/// orders/items/parts: 20 orders, 21 items (16 for part 1313, 5 for part
/// 999), 2 parts
pub fn write_order_tables(dir: &Path) {
    let mut orders = TableBuilder::new()
        .column("OrderNo", 11, 4)
        .column("Total", 10, 8);
    for i in 1..=20 {
        orders.record(vec![integer(i), double(i as f64 * 100.0)]);
    }
    orders.write(dir, "orders");

    let mut items = TableBuilder::new()
        .column("OrderNo", 11, 4)
        .column("PartNo", 11, 4)
        .column("Qty", 11, 4);
    for i in 1..=16 {
        items.record(vec![integer(i), integer(1313), integer(i * 2)]);
    }
    for i in 1..=5 {
        items.record(vec![integer(i), integer(999), integer(1)]);
    }
    items.write(dir, "items");

    let mut parts = TableBuilder::new()
        .column("PartNo", 11, 4)
        .column("Description", 4, 30);
    parts.record(vec![integer(1313), text("Regulator System", 30)]);
    parts.record(vec![integer(999), text("Widget", 30)]);
    parts.write(dir, "parts");
}
