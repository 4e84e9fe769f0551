use super::{print_value, SourceOptions};
use lazydi::core::DiResult;
use lazydi::di::Provider;

pub fn run(path: &str, source: SourceOptions) -> DiResult<()> {
    let config = source.build()?;
    let value = config.lookup(path)?.get()?;
    print_value(&value, source.format())
}
