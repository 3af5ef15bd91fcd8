//! `imgdl resolve <url>` – show the candidate without downloading.

use anyhow::{bail, Result};
use imgdl_core::config::ImgdlConfig;
use imgdl_core::fetch_head::CurlTransport;
use imgdl_core::page_probe::{LocalProbe, PageContext, PageProbe, StaticProbe};
use imgdl_core::resolver::{resolve, Candidate, CandidateOutcome, Collaborators, SourceReference};

use crate::cli::ResolveArgs;

/// Runs the resolver with the libcurl transport and the probe selected by `args`.
pub(crate) async fn resolve_candidate(cfg: &ImgdlConfig, args: &ResolveArgs) -> Result<Candidate> {
    let mut options = cfg.resolve_options();
    if let Some(t) = &args.template {
        options.template = Some(t.clone());
    }
    if args.no_head {
        options.head_probe = false;
    }

    let page = PageContext {
        page_url: args.page_url.clone(),
        srcset: args.srcset.clone(),
    };
    let static_probe = args.probe_json.as_deref().map(StaticProbe::new);
    let probe: &dyn PageProbe = match &static_probe {
        Some(p) => p,
        None => &LocalProbe,
    };
    let transport = CurlTransport::default();
    let collaborators = Collaborators {
        page_probe: Some(probe),
        transport: Some(&transport),
    };

    match resolve(&SourceReference::new(&args.url), &page, collaborators, &options).await {
        CandidateOutcome::Resolved(candidate) => Ok(candidate),
        CandidateOutcome::Failed(e) => bail!("cannot resolve {:?}: {}", args.url, e),
    }
}

pub async fn run_resolve(cfg: &ImgdlConfig, args: &ResolveArgs) -> Result<()> {
    let candidate = resolve_candidate(cfg, args).await?;
    println!("url:      {}", candidate.url);
    println!("filename: {}", candidate.filename);
    Ok(())
}
