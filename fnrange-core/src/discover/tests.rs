//! Tests for function discovery

#[cfg(test)]
mod discover_tests {
    use crate::discover;
    use crate::language::Dialect;
    use crate::lower::lower_program;
    use crate::naming::NamingMode;
    use crate::parser;
    use crate::position::Position;
    use crate::range::NamedRange;
    use swc_common::{sync::Lrc, SourceMap};

    fn parse_and_discover_with(src: &str, filename: &str, mode: NamingMode) -> Vec<NamedRange> {
        let cm: Lrc<SourceMap> = Default::default();
        let parsed =
            parser::parse_source(src, &cm, filename, Dialect::from_file_name(filename)).unwrap();
        let tree = lower_program(&parsed.program, src, parsed.file.start_pos);
        discover::discover_named_ranges(&tree, src, filename, mode).unwrap()
    }

    fn parse_and_discover(src: &str) -> Vec<NamedRange> {
        parse_and_discover_with(src, "test.ts", NamingMode::Default)
    }

    fn names(ranges: &[NamedRange]) -> Vec<&str> {
        ranges.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_global_record_first() {
        let src = "let a = 1;\nlet b = 2;\n";
        let ranges = parse_and_discover(src);
        assert_eq!(ranges.len(), 1, "No functions, only the global record");
        assert_eq!(ranges[0].name(), "globalCode: test.ts");
        assert_eq!(ranges[0].start(), Position::new(0, 0));
        assert_eq!(ranges[0].end(), Position::new(2, 0));
    }

    #[test]
    fn test_empty_source() {
        let ranges = parse_and_discover_with("", "empty.js", NamingMode::Default);
        assert_eq!(names(&ranges), vec!["globalCode: empty.js"]);
        assert_eq!(ranges[0].end(), Position::new(0, 0));
    }

    #[test]
    fn test_discover_single_function() {
        let src = "function foo() { return 1; }";
        let ranges = parse_and_discover(src);
        assert_eq!(names(&ranges), vec!["globalCode: test.ts", "foo"]);
        assert_eq!(ranges[1].start(), Position::new(0, 0));
        assert_eq!(ranges[1].end(), Position::new(0, 28));
    }

    #[test]
    fn test_nested_functions_in_preorder() {
        let src = r#"function outer() {
    const inner = function () {
        return () => 1;
    };
    return inner;
}
function after() {}"#;
        let ranges = parse_and_discover(src);
        assert_eq!(
            names(&ranges),
            vec!["globalCode: test.ts", "outer", "inner", "anonymousFunction", "after"]
        );
        assert_eq!(ranges[2].start(), Position::new(1, 18));
        assert_eq!(ranges[3].start(), Position::new(2, 15));
        assert_eq!(ranges[3].end(), Position::new(2, 22));
    }

    #[test]
    fn test_bodiless_declarations_are_skipped() {
        let src = r#"
            function overload(a: string): void;
            function overload(a: any) {}
            declare function ambient(): void;
            abstract class Base {
                abstract run(): void;
                stop() {}
            }
            interface Shape { area(): number; }
        "#;
        let ranges = parse_and_discover(src);
        assert_eq!(
            names(&ranges),
            vec!["globalCode: test.ts", "overload", "Base.stop"]
        );
    }

    #[test]
    fn test_class_members() {
        let src = r#"
            class Counter {
                constructor() {}
                get count() { return 0; }
                set count(v) {}
                increment() {}
                static reset() {}
                #tick() {}
                [Symbol.iterator]() {}
                onClick = () => {};
            }
        "#;
        let ranges = parse_and_discover(src);
        assert_eq!(
            names(&ranges),
            vec![
                "globalCode: test.ts",
                "constructorCall:, Counter",
                "Counter.get count",
                "Counter.set count",
                "Counter.increment",
                "Counter.reset",
                "Counter.#tick",
                "Counter.computedProperty",
                "onClick",
            ]
        );
    }

    #[test]
    fn test_heap_snapshot_mode() {
        let src = "class C { constructor() {} }";
        let ranges = parse_and_discover_with(src, "a.js", NamingMode::HeapSnapshot);
        assert_eq!(ranges[1].name(), "classConstructorCall: C");
    }

    #[test]
    fn test_class_expression_members() {
        let src = "const K = class { constructor() {} run() {} };";
        let ranges = parse_and_discover(src);
        assert_eq!(
            names(&ranges),
            vec![
                "globalCode: test.ts",
                "constructorCall:, anonymousClass",
                "anonymousClass.run",
            ]
        );
    }

    #[test]
    fn test_object_literal_members() {
        let src = r#"
            const api = {
                load: function () {},
                save: () => {},
                'with-dash': () => {},
                reset() {},
                get ready() { return true; },
            };
        "#;
        let ranges = parse_and_discover(src);
        assert_eq!(
            names(&ranges),
            vec![
                "globalCode: test.ts",
                "load",
                "save",
                "anonymousFunction",
                "reset",
                "get ready",
            ]
        );
    }

    #[test]
    fn test_assignments_and_callbacks() {
        let src = r#"
            module.exports.handler = function () {};
            window['onload'] = () => {};
            target = function () {};
            counter += function () {};
            items.forEach(item => item);
            emitter.on('data', function () {});
            new Promise((resolve) => resolve());
            setTimeout((function () {}), 10);
        "#;
        let ranges = parse_and_discover_with(src, "test.js", NamingMode::Default);
        assert_eq!(
            names(&ranges),
            vec![
                "globalCode: test.js",
                "module.exports.handler",
                "window['onload']",
                "target",
                "anonymousFunction",
                "anonymousCallbackTo: items.forEach",
                "anonymousCallbackTo: emitter.on",
                "anonymousCallbackTo: new Promise",
                "anonymousCallbackTo: setTimeout",
            ]
        );
    }

    #[test]
    fn test_iife_is_anonymous() {
        let ranges = parse_and_discover("(() => {})();\n(function () {})();");
        assert_eq!(
            names(&ranges),
            vec!["globalCode: test.ts", "anonymousFunction", "anonymousFunction"]
        );
    }

    #[test]
    fn test_ranges_are_valid() {
        let src = "const f = () => {\r\n  return g(function () {});\r\n};\r\n";
        let ranges = parse_and_discover(src);
        for range in &ranges {
            assert!(range.start() <= range.end(), "{:?}", range);
        }
        assert_eq!(ranges[1].start(), Position::new(0, 10));
        assert_eq!(ranges[1].end(), Position::new(2, 1));
        assert_eq!(ranges[2].name(), "anonymousCallbackTo: g");
        assert_eq!(ranges[2].start(), Position::new(1, 11));
    }

    #[test]
    fn test_discover_deterministic_ordering() {
        let src = r#"
            function zzz() { return 3; }
            function aaa() { return 1; }
            const mmm = () => 2;
        "#;
        let first = parse_and_discover(src);
        let second = parse_and_discover(src);
        assert_eq!(first, second);
        assert_eq!(names(&first)[1..], ["zzz", "aaa", "mmm"]);
    }
}
