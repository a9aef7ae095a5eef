//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! GLSL programs of the GL renderer

/// Shader sources and uniform names of a program
pub struct ShaderSource {
    pub vertex: &'static str,
    pub fragment: &'static str,
    pub uniforms: &'static [&'static str],
}

/// Grid lines in a single color
pub const GRID_SHADER: ShaderSource = ShaderSource {
    vertex: r#"
        attribute vec3 a_position;

        uniform mat4 u_matrix;

        void main() {
            gl_Position = u_matrix * vec4(a_position, 1.0);
        }
    "#,
    fragment: r#"
        precision mediump float;

        uniform float u_opacity;

        uniform vec4 u_color;

        void main() {
            gl_FragColor = u_color * u_opacity;
        }
    "#,
    uniforms: &["u_matrix", "u_color", "u_opacity"],
};

/// Data cells with per vertex color and opacity bytes
pub const DATA_SHADER: ShaderSource = ShaderSource {
    vertex: r#"
        attribute vec3 a_position;
        attribute vec3 a_color;
        attribute float a_opacity;

        varying vec4 v_color;

        uniform mat4 u_matrix;

        void main() {
            v_color = vec4(a_color / 255.0, 1.0) * (a_opacity / 255.0);
            gl_Position = u_matrix * vec4(a_position, 1.0);
        }
    "#,
    fragment: r#"
        precision mediump float;

        varying vec4 v_color;

        void main() {
            gl_FragColor = v_color;
        }
    "#,
    uniforms: &["u_matrix"],
};
