//! Info Command
//!
//! Shows the profile, the declared optimizations and chunk sizing.

use crate::symbols;
use anyhow::Result;
use console::style;
use stripegate_core::{PluginFlags, StripeCodec};

/// Info configuration
pub struct InfoConfig {
    /// Stripe width to compute the chunk size for
    pub width: Option<usize>,
}

/// Run info command
pub fn run(codec: &StripeCodec, config: InfoConfig) -> Result<()> {
    let profile = codec.profile();

    println!("{}", style("StripeGate Profile").bold().underlined());
    println!("{}", symbols::HLINE);
    println!("  Data shards (k):      {}", style(profile.k).cyan());
    println!("  Coding shards (m):    {}", style(profile.m).cyan());
    println!("  Total shards (n):     {}", style(profile.n).cyan());
    println!(
        "  Minimum for decode:   {}",
        style(profile.min_shards_for_decode).cyan()
    );
    println!(
        "  Tolerated failures:   {}",
        style(profile.max_tolerated_failures).cyan()
    );
    println!("  Alignment:            {} bytes", style(profile.base_alignment).cyan());
    println!();

    println!("{}", style("Optimizations").bold());
    let flags = codec.supported_optimizations();
    for (name, flag) in [
        ("optimized", PluginFlags::OPTIMIZED),
        ("zero padding", PluginFlags::ZERO_PADDING),
        ("partial read", PluginFlags::PARTIAL_READ),
        ("partial write", PluginFlags::PARTIAL_WRITE),
        ("parity delta", PluginFlags::PARITY_DELTA),
    ] {
        let mark = if flags.contains(flag) {
            style(symbols::CHECK).green()
        } else {
            style(symbols::CROSS).red()
        };
        println!("  {} {}", mark, name);
    }

    if let Some(width) = config.width {
        println!();
        println!(
            "Stripe width {} -> chunk size {} ({} bytes encoded)",
            width,
            style(codec.chunk_size_for(width)).cyan(),
            codec.chunk_size_for(width) * profile.k
        );
        if width % profile.base_alignment != 0 {
            println!(
                "{} {} is not a multiple of {}; encode pads it first",
                style(symbols::WARN).yellow(),
                width,
                profile.base_alignment
            );
        }
    }

    Ok(())
}
