//! Native GeoTIFF reading/writing using the `tiff` crate
//!
//! Grids are written as single-band 8-bit images with ModelPixelScale,
//! ModelTiepoint and a minimal GeoKey directory. Tiepoints refer to the
//! center of pixel (0, 0) (`RasterPixelIsPoint`), matching the node
//! convention of [`GeoTransform`].

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray8;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE_TAG: u16 = 33550;
const MODEL_TIEPOINT_TAG: u16 = 33922;
const GEO_KEY_DIRECTORY_TAG: u16 = 34735;

const GT_MODEL_TYPE_GEO_KEY: u16 = 1024;
const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_GEO_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;

const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;
const RASTER_PIXEL_IS_POINT: u16 = 2;

const PHOTOMETRIC_RGB_PALETTE: u16 = 3;

/// 256-entry color table mapping each intensity level to RGB
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<[u8; 3]>,
}

impl Palette {
    /// Build a palette by evaluating `f` for every level 0..=255
    pub fn from_fn<F: FnMut(u8) -> [u8; 3]>(mut f: F) -> Self {
        Self {
            entries: (0..=255u8).map(&mut f).collect(),
        }
    }

    /// RGB triple for `level`
    pub fn entry(&self, level: u8) -> [u8; 3] {
        self.entries[level as usize]
    }

    /// TIFF ColorMap layout: 256 reds, then greens, then blues, 16 bits each
    fn to_tiff_colormap(&self) -> Vec<u16> {
        let mut out = Vec::with_capacity(3 * 256);
        for channel in 0..3 {
            out.extend(self.entries.iter().map(|rgb| rgb[channel] as u16 * 257));
        }
        out
    }
}

/// Options for writing GeoTIFF files
#[derive(Debug, Clone, Default)]
pub struct GeoTiffOptions {
    /// Color table; `None` writes a plain grayscale image
    pub palette: Option<Palette>,
    /// CRS to label the file with when the raster carries none (default WGS84)
    pub crs: Option<CRS>,
}

/// Read a GeoTIFF file into a Raster
pub fn read_geotiff<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_geotiff(file)
}

/// Read a GeoTIFF from an in-memory buffer into a Raster
pub fn read_geotiff_from_buffer<T>(data: &[u8]) -> Result<Raster<T>>
where
    T: RasterElement,
{
    decode_geotiff(Cursor::new(data))
}

fn cast_all<S, T>(buf: Vec<S>) -> Vec<T>
where
    S: num_traits::NumCast + Copy,
    T: RasterElement,
{
    buf.into_iter()
        .map(|v| num_traits::cast::<S, f64>(v).map_or(T::zero(), T::saturating_from_f64))
        .collect()
}

/// Internal: decode a GeoTIFF from any `Read + Seek` source
fn decode_geotiff<T, R>(reader: R) -> Result<Raster<T>>
where
    T: RasterElement,
    R: std::io::Read + std::io::Seek,
{
    let mut decoder =
        Decoder::new(reader).map_err(|e| Error::Sink(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| Error::Sink(format!("Cannot read dimensions: {}", e)))?;

    let rows = height as usize;
    let cols = width as usize;

    let result = decoder
        .read_image()
        .map_err(|e| Error::Sink(format!("Cannot read image data: {}", e)))?;

    let data: Vec<T> = match result {
        DecodingResult::U8(buf) => cast_all(buf),
        DecodingResult::U16(buf) => cast_all(buf),
        DecodingResult::U32(buf) => cast_all(buf),
        DecodingResult::I16(buf) => cast_all(buf),
        DecodingResult::I32(buf) => cast_all(buf),
        DecodingResult::F32(buf) => cast_all(buf),
        DecodingResult::F64(buf) => cast_all(buf),
        _ => {
            return Err(Error::Sink("Unsupported TIFF pixel format".to_string()));
        }
    };

    let mut raster = Raster::from_vec(data, rows, cols)?;

    let keys = decoder
        .get_tag_u16_vec(Tag::Unknown(GEO_KEY_DIRECTORY_TAG))
        .unwrap_or_default();
    if let Some(transform) = read_geotransform(&mut decoder, &keys) {
        raster.set_transform(transform);
    }
    raster.set_crs(read_crs(&keys));

    Ok(raster)
}

/// Read the transform from ModelPixelScale + ModelTiepoint, honoring the
/// raster type key (area tiepoints are moved to the pixel center).
fn read_geotransform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
    keys: &[u16],
) -> Option<GeoTransform> {
    let scale = decoder
        .get_tag_f64_vec(Tag::Unknown(MODEL_PIXEL_SCALE_TAG))
        .ok()?;
    let tiepoint = decoder.get_tag_f64_vec(Tag::Unknown(MODEL_TIEPOINT_TAG)).ok()?;
    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }

    let pixel_is_area =
        geo_key(keys, GT_RASTER_TYPE_GEO_KEY).map_or(true, |v| v == RASTER_PIXEL_IS_AREA);

    // tiepoint: [I, J, K, X, Y, Z]
    let (mut i, mut j) = (tiepoint[0], tiepoint[1]);
    if pixel_is_area {
        i -= 0.5;
        j -= 0.5;
    }
    let origin_x = tiepoint[3] - i * scale[0];
    let origin_y = tiepoint[4] + j * scale[1];
    Some(GeoTransform::new(origin_x, origin_y, scale[0], scale[1]))
}

fn read_crs(keys: &[u16]) -> Option<CRS> {
    geo_key(keys, GEOGRAPHIC_TYPE_GEO_KEY)
        .or_else(|| geo_key(keys, PROJECTED_CS_TYPE_GEO_KEY))
        .filter(|&code| code != 0 && code != 32767)
        .map(|code| CRS::from_epsg(code as u32))
}

/// Look up a short-valued key in a GeoKey directory
fn geo_key(directory: &[u16], key: u16) -> Option<u16> {
    let count = *directory.get(3)? as usize;
    directory
        .get(4..4 + count * 4)?
        .chunks_exact(4)
        .find(|entry| entry[0] == key && entry[1] == 0)
        .map(|entry| entry[3])
}

fn geo_key_directory(crs: &CRS) -> Vec<u16> {
    let epsg = u16::try_from(crs.epsg()).unwrap_or(32767);
    let (model, crs_key) = if crs.is_geographic() {
        (MODEL_TYPE_GEOGRAPHIC, GEOGRAPHIC_TYPE_GEO_KEY)
    } else {
        (MODEL_TYPE_PROJECTED, PROJECTED_CS_TYPE_GEO_KEY)
    };
    vec![
        1, 1, 0, 3, // version 1.1.0, 3 keys
        GT_MODEL_TYPE_GEO_KEY, 0, 1, model,
        GT_RASTER_TYPE_GEO_KEY, 0, 1, RASTER_PIXEL_IS_POINT,
        crs_key, 0, 1, epsg,
    ]
}

/// Write an 8-bit grid to a GeoTIFF file
pub fn write_geotiff<P: AsRef<Path>>(
    raster: &Raster<u8>,
    path: P,
    options: &GeoTiffOptions,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    encode_geotiff(raster, file, options)
}

/// Write an 8-bit grid to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer(raster: &Raster<u8>, options: &GeoTiffOptions) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf), options)?;
    Ok(buf)
}

/// Internal: encode a grid as GeoTIFF into any `Write + Seek` sink
fn encode_geotiff<W>(raster: &Raster<u8>, writer: W, options: &GeoTiffOptions) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
{
    let (rows, cols) = raster.shape();
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }

    let sink_err = |what: &str, e: tiff::TiffError| Error::Sink(format!("{}: {}", what, e));

    let mut encoder = TiffEncoder::new(writer).map_err(|e| sink_err("TIFF encoder error", e))?;

    let data: Vec<u8> = raster.data().iter().copied().collect();

    let mut image = encoder
        .new_image::<Gray8>(cols as u32, rows as u32)
        .map_err(|e| sink_err("Cannot create TIFF image", e))?;

    let gt = raster.transform();
    let crs = raster.crs().copied().or(options.crs).unwrap_or_default();

    let scale = [gt.pixel_width, gt.pixel_height, 0.0];
    image
        .encoder()
        .write_tag(Tag::Unknown(MODEL_PIXEL_SCALE_TAG), &scale[..])
        .map_err(|e| sink_err("Cannot write scale tag", e))?;

    let (x0, y0) = gt.pixel_to_geo(0.0, 0.0);
    let tiepoint = [0.0, 0.0, 0.0, x0, y0, 0.0];
    image
        .encoder()
        .write_tag(Tag::Unknown(MODEL_TIEPOINT_TAG), &tiepoint[..])
        .map_err(|e| sink_err("Cannot write tiepoint tag", e))?;

    let geokeys = geo_key_directory(&crs);
    image
        .encoder()
        .write_tag(Tag::Unknown(GEO_KEY_DIRECTORY_TAG), &geokeys[..])
        .map_err(|e| sink_err("Cannot write geokey tag", e))?;

    if let Some(palette) = &options.palette {
        image
            .encoder()
            .write_tag(Tag::PhotometricInterpretation, PHOTOMETRIC_RGB_PALETTE)
            .map_err(|e| sink_err("Cannot write photometric tag", e))?;
        let colormap = palette.to_tiff_colormap();
        image
            .encoder()
            .write_tag(Tag::ColorMap, &colormap[..])
            .map_err(|e| sink_err("Cannot write color map", e))?;
    }

    image
        .write_data(&data)
        .map_err(|e| sink_err("Cannot write image data", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> Raster<u8> {
        let data: Vec<u8> = (0..12).map(|v| v * 20).collect();
        let mut raster = Raster::from_vec(data, 3, 4).unwrap();
        raster.set_transform(GeoTransform::new(10.0, 54.5, 0.01, 0.02).with_offset(-1.5, -1.5));
        raster
    }

    #[test]
    fn test_roundtrip_buffer() {
        let raster = ramp();
        let buf = write_geotiff_to_buffer(&raster, &GeoTiffOptions::default()).unwrap();
        let back: Raster<u8> = read_geotiff_from_buffer(&buf).unwrap();

        assert_eq!(back.shape(), (3, 4));
        assert_eq!(back.data(), raster.data());
        assert_eq!(back.crs(), Some(&CRS::wgs84()));

        // The offset is folded into the origin; node positions agree
        for (row, col) in [(0, 0), (2, 3)] {
            let a = raster.transform().cell_center(row, col);
            let b = back.transform().cell_center(row, col);
            assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_roundtrip_file() {
        let raster = ramp();
        let tmp = tempfile::NamedTempFile::new().unwrap();
        write_geotiff(&raster, tmp.path(), &GeoTiffOptions::default()).unwrap();
        let back: Raster<f64> = read_geotiff(tmp.path()).unwrap();
        assert_eq!(back.get(2, 3).unwrap(), 220.0);
    }

    #[test]
    fn test_palette_written() {
        let raster = ramp();
        let inverted = Palette::from_fn(|l| [255 - l, 255 - l, 255 - l]);
        let plain = write_geotiff_to_buffer(&raster, &GeoTiffOptions::default()).unwrap();
        let options = GeoTiffOptions {
            palette: Some(inverted),
            ..Default::default()
        };
        let colored = write_geotiff_to_buffer(&raster, &options).unwrap();
        // 768 16-bit color map entries
        assert!(colored.len() >= plain.len() + 768 * 2);
        assert_eq!(&colored[..2], b"II");
    }

    #[test]
    fn test_palette_layout() {
        let p = Palette::from_fn(|l| [l, 0, 255]);
        assert_eq!(p.entry(7), [7, 0, 255]);
        let map = p.to_tiff_colormap();
        assert_eq!(map.len(), 768);
        assert_eq!(map[255], 255 * 257);
        assert_eq!(map[256], 0);
        assert_eq!(map[512], 65535);
    }

    #[test]
    fn test_geo_keys() {
        let keys = geo_key_directory(&CRS::wgs84());
        assert_eq!(geo_key(&keys, GT_MODEL_TYPE_GEO_KEY), Some(MODEL_TYPE_GEOGRAPHIC));
        assert_eq!(geo_key(&keys, GEOGRAPHIC_TYPE_GEO_KEY), Some(4326));
        assert_eq!(geo_key(&keys, GT_RASTER_TYPE_GEO_KEY), Some(RASTER_PIXEL_IS_POINT));
        assert_eq!(geo_key(&keys, PROJECTED_CS_TYPE_GEO_KEY), None);
    }

    #[test]
    fn test_empty_raster_rejected() {
        let raster: Raster<u8> = Raster::new(0, 5);
        assert!(write_geotiff_to_buffer(&raster, &GeoTiffOptions::default()).is_err());
    }
}
