use super::{print_value, SourceOptions};
use lazydi::core::DiResult;
use lazydi::di::Provider;

pub fn run(source: SourceOptions) -> DiResult<()> {
    let config = source.build()?;
    print_value(&config.get()?, source.format())
}
