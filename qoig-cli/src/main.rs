use argh::FromArgs;
use image::{ImageFormat, RgbImage, RgbaImage};
use qoig::{
    consts::QOIG_SRGB, decode::QoigDecodeContext, encode::QoigEncodeContext, tune, EncodeConfig,
    QoigDesc,
};
use std::{fs::File, io::BufReader};

/// QOIG cli encoder and decoder.
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Encode(Encode),
    Decode(Decode),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli { command } = argh::from_env();

    match command {
        Command::Encode(options) => encode(options),
        Command::Decode(options) => decode(options),
    }
}

/// Encodes a PNG image as QOIG.
#[derive(FromArgs)]
#[argh(subcommand, name = "encode")]
struct Encode {
    /// use options for plain backwards-compatible QOI
    #[argh(switch, short = 'q')]
    plain_qoi: bool,

    /// max compression: every feature plus cache search; probes every
    /// split unless --cache-size pins one (slow)
    #[argh(switch, short = 'm')]
    max: bool,

    /// good fast compression: long runs, long indexing, raw blocks;
    /// cache split defaults to 26
    #[argh(switch, short = 'f')]
    fast: bool,

    /// size of the exact-match cache region, as a split index (0..=30)
    #[argh(option, short = 'c')]
    cache_size: Option<u8>,

    /// number of cache splits to probe for best compression (0..=31,
    /// higher is slower)
    #[argh(option, short = 'n')]
    probes: Option<u8>,

    /// use extra compression on long runs
    #[argh(switch, short = 'r')]
    longruns: bool,

    /// use the larger secondary color caches
    #[argh(switch, short = 'i')]
    longindex: bool,

    /// allow blocks of uncompressed colors
    #[argh(switch, short = 'b')]
    rawblocks: bool,

    /// search the whole near cache for similar colors (slower, slightly
    /// better compression)
    #[argh(switch, short = 's')]
    search: bool,

    /// the input PNG file
    #[argh(positional)]
    input: String,
    /// the output QOIG file
    #[argh(positional)]
    output: String,
}

fn encode(options: Encode) -> Result<(), Box<dyn std::error::Error>> {
    let mut clen_index = 0u8;
    let mut probes = 0u8;
    let mut longruns = options.longruns;
    let mut longindex = options.longindex;
    let mut rawblocks = options.rawblocks;
    let mut search = options.search;

    if options.fast {
        clen_index = options.cache_size.unwrap_or(26);
        longruns = true;
        longindex = true;
        rawblocks = true;
    } else if options.max {
        longruns = true;
        longindex = true;
        rawblocks = true;
        search = true;
        match options.cache_size {
            Some(c) => clen_index = c,
            None => probes = 31,
        }
    } else if let Some(c) = options.cache_size {
        clen_index = c;
    }
    if let Some(n) = options.probes {
        probes = n;
    }
    if options.plain_qoi {
        clen_index = 30;
        longruns = false;
        longindex = false;
        rawblocks = false;
        search = false;
        probes = 0;
    }
    if clen_index > 30 {
        return Err("cache split index must be in the range 0 to 30".into());
    }
    if probes > 31 {
        return Err("number of splits to probe must be in the range 0 to 31".into());
    }

    let image = image::io::Reader::with_format(
        BufReader::new(File::open(&options.input)?),
        ImageFormat::Png,
    )
    .decode()?;
    let channels: u8 = if image.color().has_alpha() { 4 } else { 3 };
    let (width, height) = (image.width(), image.height());

    println!("Encoding {width}x{height} image");

    let rgba = image.into_rgba8();
    let desc = QoigDesc {
        width,
        height,
        channels,
        colorspace: QOIG_SRGB,
    };
    let mut cfg = EncodeConfig {
        clen_index,
        longruns,
        longindex,
        rawblocks,
        searchcache: search,
        bytecap: None,
    };

    if probes > 0 {
        let best = tune::pick_cache_length(rgba.as_raw(), &desc, &cfg, probes)?;
        println!("Best cache size was {best}.");
        cfg.clen_index = best;
    }

    let mut v = Vec::with_capacity(rgba.as_raw().len() / 2);
    QoigEncodeContext::encode_to_vec(rgba.as_raw(), &desc, &cfg, &mut v)?;

    std::fs::write(&options.output, &v)?;
    println!("Written {} bytes to `{}`", v.len(), options.output);

    Ok(())
}

/// Decodes a QOIG image into a PNG.
#[derive(FromArgs)]
#[argh(subcommand, name = "decode")]
struct Decode {
    /// the input QOIG file
    #[argh(positional)]
    input: String,
    /// the output PNG file
    #[argh(positional)]
    output: String,
}

fn decode(options: Decode) -> Result<(), Box<dyn std::error::Error>> {
    let qoig_input = std::fs::read(&options.input)?;

    println!("Decoding `{}`", options.input);

    let mut pixels = Vec::with_capacity(1024 * 1024);
    let header = QoigDecodeContext::decode_to_vec(&qoig_input, &mut pixels)?;
    let (width, height) = (header.desc.width, header.desc.height);

    match header.desc.channels {
        3 => RgbImage::from_vec(width, height, pixels)
            .ok_or("failed to create image")?
            .save_with_format(&options.output, ImageFormat::Png)?,
        _ => RgbaImage::from_vec(width, height, pixels)
            .ok_or("failed to create image")?
            .save_with_format(&options.output, ImageFormat::Png)?,
    }

    println!("Written {width}x{height} image to `{}`", options.output);

    Ok(())
}
