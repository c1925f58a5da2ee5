use spindle::roster::ItemLabel;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Show,
    Hide,
    Spin,
    Add(ItemLabel),
    Remove(usize),
    Clear,
    ConfigReload,
}
