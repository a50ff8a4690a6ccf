use std::path::PathBuf;

use clap::Parser;

use bitstream_inspector::analyzer::{
    AnalysisResponse, ByteRange, DEFAULT_MAX_INLINE_SIZE, DEFAULT_TIMEOUT_SECS, Options,
    analyze_file, count_by_type, to_json, to_json_pretty,
};

#[derive(Parser)]
struct Opt {
    /// Elementary-stream file (Annex-B) to analyze
    input: PathBuf,

    /// Codec hint: h264 | hevc (anything else falls back to raw hex)
    #[clap(long, default_value = "h264")]
    codec: String,

    /// Inline size budget in bytes before chunked delivery kicks in
    #[clap(long, default_value_t = DEFAULT_MAX_INLINE_SIZE)]
    max_inline_size: u64,

    /// Fetch only this byte range as a chunk, e.g. "0..1048576" or "4096.."
    #[clap(long)]
    range: Option<String>,

    /// Skip codec-specific parameter-set decoding
    #[clap(long, default_value_t = false)]
    no_parameter_sets: bool,

    /// Wall-clock timeout in seconds for the whole request
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Pretty-print the JSON response
    #[clap(long, default_value_t = false)]
    pretty: bool,

    /// Print a human-readable summary instead of JSON
    #[clap(long, default_value_t = false)]
    summary: bool,
}

fn parse_range(spec: &str) -> anyhow::Result<ByteRange> {
    let (start, end) = spec
        .split_once("..")
        .ok_or_else(|| anyhow::anyhow!("range must look like start..end or start.."))?;
    Ok(ByteRange {
        start: start.parse()?,
        end: if end.is_empty() { None } else { Some(end.parse()?) },
    })
}

fn print_summary(resp: &AnalysisResponse) {
    match resp {
        AnalysisResponse::Full(result) => {
            println!("================ Bitstream Inspector =================");
            let keyframes = result
                .nal_units
                .iter()
                .filter(|u| u.nal_type.is_some_and(|t| result.codec.is_keyframe(t)))
                .count();
            println!(
                "codec {:?} | {} bytes | {} NAL units | {} keyframe(s)",
                result.codec,
                result.statistics.total_size,
                result.statistics.nal_unit_count,
                keyframes
            );
            for (name, count) in count_by_type(&result.nal_units) {
                println!("  {count:>5} x {name}");
            }
            for sps in &result.parameter_sets.sps {
                println!(
                    "  SPS {} | profile {} level {} | {}x{} {} {}-bit",
                    sps.id,
                    sps.profile_idc,
                    sps.level_idc,
                    sps.width,
                    sps.height,
                    sps.chroma_format,
                    sps.bit_depth_luma,
                );
            }
            for pps in &result.parameter_sets.pps {
                println!("  PPS {} -> SPS {}", pps.id, pps.sps_id);
            }
            for vps in &result.parameter_sets.vps {
                println!("  VPS {} | {} layer(s)", vps.id, vps.max_layers);
            }
        }
        AnalysisResponse::TooLarge { message, suggested_chunk_size, .. } => {
            println!("too large: {message} (suggested chunk size {suggested_chunk_size})");
        }
        AnalysisResponse::Chunk(chunk) => {
            println!(
                "chunk {}..{} | {} hex chars",
                chunk.current_chunk.start,
                chunk.current_chunk.end,
                chunk.bitstream.len()
            );
        }
        AnalysisResponse::Failure { error } => println!("failed: {error}"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::parse();

    let opts = Options {
        codec_hint: opt.codec,
        codec_specific: !opt.no_parameter_sets,
        max_inline_size: opt.max_inline_size,
        byte_range: opt.range.as_deref().map(parse_range).transpose()?,
        timeout_secs: opt.timeout,
    };

    let resp = analyze_file(opt.input, &opts).await;

    if opt.summary {
        print_summary(&resp);
    } else if opt.pretty {
        println!("{}", to_json_pretty(&resp));
    } else {
        println!("{}", to_json(&resp));
    }

    if !resp.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
