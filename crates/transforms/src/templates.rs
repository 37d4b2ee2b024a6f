//! Source templates for the generated nodes.

use veil_core::template::Template;

/// Rotation bootstrap. `{code}` advances the counter, which makes the helper
/// shift the array left once per remaining count.
pub const STRING_ARRAY_ROTATE_FUNCTION: Template = Template::new(
    "(function (array, {timesName}) {
    var {whileFunctionName} = function (times) {
        while (--times) {
            array['push'](array['shift']());
        }
    };
    {code}
})({stringArrayName}, {stringArrayRotateValue});",
);

/// Advances the counter unconditionally.
pub const PLAIN_ADVANCE: Template = Template::new("{whileFunctionName}(++{timesName});");

/// Advances the counter only if it still equals the expected rotation value.
/// Anything else spins forever without a hint of what failed.
pub const SELF_DEFENDING: Template = Template::new(
    "var selfDefendingFunc = function (value) {
    if (value !== {expectedRotateValue}) {
        for (;;) {
            value = value ^ value << 1;
        }
    }
    {whileFunctionName}(++{timesName});
};
selfDefendingFunc({timesName});",
);

pub const STRING_ARRAY: Template = Template::new("var {stringArrayName} = [{items}];");

/// Same hash as the generation-time one, recomputed over the array as emitted.
pub const STRING_ARRAY_HASH: Template = Template::new(
    "var {stringArrayHashName} = (function (array) {
    var hash = 0;
    for (var i = 0; i < array['length']; i++) {
        for (var j = 0; j < array[i]['length']; j++) {
            hash = ((hash << 5) - hash + array[i]['charCodeAt'](j)) | 0;
        }
    }
    return hash;
})({stringArrayName});",
);
