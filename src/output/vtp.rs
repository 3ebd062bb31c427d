use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::surface::SurfaceMesh;

/// Write a triangle mesh as VTK XML PolyData with ASCII data arrays, the
/// layout ParaView and VTK readers expect: a `Points` array plus `Polys`
/// connectivity and offsets.
pub fn write_vtp(mesh: &SurfaceMesh, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(path).map_err(|e| format!("Failed to create {:?}: {}", path, e))?;
    let mut writer = Writer::new_with_indent(BufWriter::new(file), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;

    let mut vtk_file = BytesStart::new("VTKFile");
    vtk_file.push_attribute(("type", "PolyData"));
    vtk_file.push_attribute(("version", "1.0"));
    vtk_file.push_attribute(("byte_order", "LittleEndian"));
    writer.write_event(Event::Start(vtk_file))?;

    writer.write_event(Event::Start(BytesStart::new("PolyData")))?;

    let mut piece = BytesStart::new("Piece");
    piece.push_attribute(("NumberOfPoints", mesh.positions.len().to_string().as_str()));
    piece.push_attribute(("NumberOfPolys", mesh.triangle_count().to_string().as_str()));
    writer.write_event(Event::Start(piece))?;

    writer.write_event(Event::Start(BytesStart::new("Points")))?;
    write_data_array(&mut writer, "Float32", None, Some(3), &points_text(mesh))?;
    writer.write_event(Event::End(BytesEnd::new("Points")))?;

    writer.write_event(Event::Start(BytesStart::new("Polys")))?;
    write_data_array(
        &mut writer,
        "Int64",
        Some("connectivity"),
        None,
        &connectivity_text(mesh),
    )?;
    write_data_array(&mut writer, "Int64", Some("offsets"), None, &offsets_text(mesh))?;
    writer.write_event(Event::End(BytesEnd::new("Polys")))?;

    writer.write_event(Event::End(BytesEnd::new("Piece")))?;
    writer.write_event(Event::End(BytesEnd::new("PolyData")))?;
    writer.write_event(Event::End(BytesEnd::new("VTKFile")))?;

    Ok(())
}

fn write_data_array<W: std::io::Write>(
    writer: &mut Writer<W>,
    data_type: &str,
    name: Option<&str>,
    components: Option<u32>,
    text: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut array = BytesStart::new("DataArray");
    array.push_attribute(("type", data_type));
    if let Some(name) = name {
        array.push_attribute(("Name", name));
    }
    if let Some(components) = components {
        array.push_attribute(("NumberOfComponents", components.to_string().as_str()));
    }
    array.push_attribute(("format", "ascii"));

    writer.write_event(Event::Start(array))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("DataArray")))?;
    Ok(())
}

fn points_text(mesh: &SurfaceMesh) -> String {
    let mut text = String::with_capacity(mesh.positions.len() * 24);
    for p in &mesh.positions {
        text.push_str(&format!("{} {} {} ", p.x, p.y, p.z));
    }
    text
}

fn connectivity_text(mesh: &SurfaceMesh) -> String {
    let mut text = String::with_capacity(mesh.indices.len() * 8);
    for index in &mesh.indices {
        text.push_str(&format!("{} ", index));
    }
    text
}

fn offsets_text(mesh: &SurfaceMesh) -> String {
    let mut text = String::with_capacity(mesh.triangle_count() * 8);
    for i in 1..=mesh.triangle_count() {
        text.push_str(&format!("{} ", i * 3));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn triangle() -> SurfaceMesh {
        SurfaceMesh {
            positions: vec![
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
            ],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn test_offsets_are_cumulative() {
        let mesh = SurfaceMesh {
            positions: triangle().positions,
            indices: vec![0, 1, 2, 2, 1, 0],
        };
        assert_eq!(offsets_text(&mesh).trim(), "3 6");
    }

    #[test]
    fn test_write_vtp_structure() {
        let path = std::env::temp_dir().join("niimesh_test_triangle.vtp");
        write_vtp(&triangle(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains(r#"<VTKFile type="PolyData""#));
        assert!(text.contains(r#"NumberOfPoints="3""#));
        assert!(text.contains(r#"NumberOfPolys="1""#));
        assert!(text.contains(r#"Name="connectivity""#));
        assert!(text.contains(r#"Name="offsets""#));
        assert!(text.contains("</VTKFile>"));

        let _ = std::fs::remove_file(&path);
    }
}
