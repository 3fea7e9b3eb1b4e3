#![allow(dead_code)]

/// Flip-flop feeding a 5-input LUT that feeds back into the flip-flop, as
/// written by VPR.
pub const COUNTER_NETLIST: &str = r"//Verilog generated by VPR  from post-place-and-route implementation
module counter (
    input \clk ,
    input \in1 ,
    output \out1 
);

    //Wires
    wire \clk_output_0_0 ;
    wire \in1_output_0_0 ;
    wire \latch_q_clock_0_0 ;
    wire \latch_q_input_0_0 ;
    wire \latch_q_output_0_0 ;
    wire \lut_n1_input_0_0 ;
    wire \lut_n1_input_0_1 ;
    wire \lut_n1_output_0_0 ;
    wire \out1_input_0_0 ;

    //IO assignments
    assign \out1  = \out1_input_0_0 ;
    assign \clk_output_0_0  = \clk ;
    assign \in1_output_0_0  = \in1 ;

    //Interconnect
    fpga_interconnect \routing_segment_clk_output_0_0_to_latch_q_clock_0_0  (
        .datain(\clk_output_0_0 ),
        .dataout(\latch_q_clock_0_0 )
    );

    fpga_interconnect \routing_segment_in1_output_0_0_to_lut_n1_input_0_0  (
        .datain(\in1_output_0_0 ),
        .dataout(\lut_n1_input_0_0 )
    );

    fpga_interconnect \routing_segment_latch_q_output_0_0_to_lut_n1_input_0_1  (
        .datain(\latch_q_output_0_0 ),
        .dataout(\lut_n1_input_0_1 )
    );

    fpga_interconnect \routing_segment_lut_n1_output_0_0_to_latch_q_input_0_0  (
        .datain(\lut_n1_output_0_0 ),
        .dataout(\latch_q_input_0_0 )
    );

    fpga_interconnect \routing_segment_latch_q_output_0_0_to_out1_input_0_0  (
        .datain(\latch_q_output_0_0 ),
        .dataout(\out1_input_0_0 )
    );

    //Cell instances
    LUT_K #(
        .K(5),
        .LUT_MASK(32'b00000000000000000000000000000110)
    ) \lut_n1  (
        .in({
            1'b0,
            1'b0,
            1'b0,
            \lut_n1_input_0_1 ,
            \lut_n1_input_0_0 
         }),
        .out(\lut_n1_output_0_0 )
    );

    DFF #(
        .INITIAL_VALUE(1'b0)
    ) \latch_q  (
        .D(\latch_q_input_0_0 ), 
        .Q(\latch_q_output_0_0 ), 
        .clock(\latch_q_clock_0_0 )
    );

endmodule
";

pub const COUNTER_TIMING: &str = r#"(DELAYFILE
    (SDFVERSION "2.1")
    (DESIGN "counter")
    (VENDOR "verilog-to-routing")
    (PROGRAM "vpr")
    (VERSION "8.1.0-dev")
    (DIVIDER /)
    (TIMESCALE 1 ps)

    (CELL
        (CELLTYPE "fpga_interconnect")
        (INSTANCE routing_segment_clk_output_0_0_to_latch_q_clock_0_0)
        (DELAY
            (ABSOLUTE
                (IOPATH datain dataout (10:10:10) (10:10:10))
            )
        )
    )

    (CELL
        (CELLTYPE "fpga_interconnect")
        (INSTANCE routing_segment_in1_output_0_0_to_lut_n1_input_0_0)
        (DELAY
            (ABSOLUTE
                (IOPATH datain dataout (1079.77:1079.77:1079.77) (1079.77:1079.77:1079.77))
            )
        )
    )

    (CELL
        (CELLTYPE "fpga_interconnect")
        (INSTANCE routing_segment_latch_q_output_0_0_to_lut_n1_input_0_1)
        (DELAY
            (ABSOLUTE
                (IOPATH datain dataout (235:240:245) (235:240:245))
            )
        )
    )

    (CELL
        (CELLTYPE "fpga_interconnect")
        (INSTANCE routing_segment_lut_n1_output_0_0_to_latch_q_input_0_0)
        (DELAY
            (ABSOLUTE
                (IOPATH datain dataout (55:55:55) (55:55:55))
            )
        )
    )

    (CELL
        (CELLTYPE "LUT_K")
        (INSTANCE lut_n1)
        (DELAY
            (ABSOLUTE
                (IOPATH in[0] out (235:235:235) (235:235:235))
                (IOPATH in[1] out (261:261:261) (261:261:261))
            )
        )
    )

    (CELL
        (CELLTYPE "DFF")
        (INSTANCE latch_q)
        (DELAY
            (ABSOLUTE
                (IOPATH (posedge clock) Q (303:303:303) (303:303:303))
            )
        )
        (TIMINGCHECK
            (SETUP D (posedge clock) (-46:-46:-46))
        )
    )
)
"#;

/// One flip-flop wired straight to module ports, no routing.
pub const SINGLE_DFF_NETLIST: &str = r"module top(clk, in1, out1);
  input clk;
  input in1;
  output out1;

  DFF #(.INITIAL_VALUE(1'b0)) ff0 (.D(in1), .Q(out1), .clock(clk));
endmodule
";

/// Timing document whose blocks name nothing in [`SINGLE_DFF_NETLIST`].
pub const UNRELATED_TIMING: &str = r#"(DELAYFILE
    (DESIGN "other")
    (CELL
        (CELLTYPE "DFF")
        (INSTANCE some_other_latch)
        (DELAY (ABSOLUTE (IOPATH (posedge clock) Q (1:1:1) (1:1:1))))
    )
)
"#;
