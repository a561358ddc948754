use houdini_common::OutputAsset;

#[derive(Debug, Default)]
pub struct BundleOutput {
  pub assets: Vec<OutputAsset>,
  pub warnings: Vec<anyhow::Error>,
}

impl BundleOutput {
  pub fn get(&self, filename: &str) -> Option<&OutputAsset> {
    self.assets.iter().find(|asset| asset.filename == filename)
  }

  pub fn filenames(&self) -> impl Iterator<Item = &str> {
    self.assets.iter().map(OutputAsset::filename)
  }
}
