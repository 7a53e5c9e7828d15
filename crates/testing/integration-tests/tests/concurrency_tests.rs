//! Independent compilations on separate threads

use cv_driver::{Config, JsonTreeParser, compile_source};
use std::thread;

#[test]
fn test_parallel_compilations_match_sequential() {
    let names = integration_tests::all_programs().unwrap();
    let sources: Vec<String> = names
        .iter()
        .map(|name| integration_tests::source(name).unwrap())
        .collect();
    let config = Config::default();

    let sequential: Vec<Option<String>> = sources
        .iter()
        .map(|source| compile_source(&JsonTreeParser, source, &config).ok().map(|c| c.ir))
        .collect();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    sources
                        .iter()
                        .map(|source| compile_source(&JsonTreeParser, source, &config).ok().map(|c| c.ir))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), sequential);
        }
    });
}
